//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Trigger                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success; for `check`, both sides reconciled cleanly      |
//! | 1    | `check` found discrepancies or a nonzero total delta     |
//! | 2    | Usage error (bad args, unreadable file)                  |
//! | 3    | Input folder holds no spreadsheet files                  |
//! | 4    | Reconciliation rules file unreadable or invalid          |
//! | 5    | JSON result could not be written                         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Discrepancies found. Like `diff(1)`, exit 1 means "ledgers differ."
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, missing or unreadable file.
pub const EXIT_USAGE: u8 = 2;

/// No spreadsheet files in the input folder.
pub const EXIT_NO_INPUT: u8 = 3;

/// Rules file could not be read, parsed or validated.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Writing the JSON result failed.
pub const EXIT_OUTPUT_WRITE: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let mut codes = [
            EXIT_SUCCESS,
            EXIT_DISCREPANCIES,
            EXIT_USAGE,
            EXIT_NO_INPUT,
            EXIT_INVALID_CONFIG,
            EXIT_OUTPUT_WRITE,
        ];
        codes.sort_unstable();
        let len = codes.len();
        let mut deduped = codes.to_vec();
        deduped.dedup();
        assert_eq!(deduped.len(), len);
    }
}
