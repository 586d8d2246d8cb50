//! Property tests for the scanner.

use bsl_lexer::Scanner;
use bsl_token::TokenKind;
use proptest::prelude::*;

/// Drives the scanner to Eof or a fatal error, collecting begin offsets.
fn scan_all(src: &str) -> Vec<usize> {
    let mut scanner = Scanner::new(src);
    let mut begins = Vec::new();
    loop {
        match scanner.scan() {
            Ok(TokenKind::Eof) | Err(_) => break,
            Ok(_) => begins.push(scanner.place().beg_pos),
        }
    }
    begins
}

proptest! {
    // The scanner must never panic, whatever bytes it is fed.
    #[test]
    fn never_panics(src in "\\PC*") {
        let _ = scan_all(&src);
    }

    // Token begin offsets are strictly increasing: the scanner always
    // makes progress.
    #[test]
    fn positions_are_monotonic(src in "[A-Za-zА-Яа-я0-9_ \n;=+().,\"|']*") {
        let begins = scan_all(&src);
        for pair in begins.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    // Identifier-and-punctuation input always scans to Eof without a
    // fatal error.
    #[test]
    fn plain_input_scans_clean(src in "[A-Za-z_ ;,()=+]*") {
        let mut scanner = Scanner::new(&src);
        loop {
            match scanner.scan() {
                Ok(TokenKind::Eof) => break,
                Ok(_) => {}
                Err(e) => prop_assert!(false, "unexpected fatal error: {e}"),
            }
        }
    }
}
