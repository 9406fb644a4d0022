//! International Morse decode table
//!
//! Sequences are packed into an integer prefix code: a leading 1 sentinel,
//! then one bit per symbol (Dot = 0, Dash = 1). `".."` packs to `0b100`,
//! `"--"` to `0b111`. The packed value is matched against the canonical
//! international assignments; anything else is unmapped and silently
//! dropped by the caller.

use crate::types::{Symbol, SYMBOL_CAPACITY};

/// Pack a symbol sequence into its prefix code.
/// Returns None for sequences longer than any valid code.
fn pack(sequence: &[Symbol]) -> Option<u16> {
    if sequence.is_empty() || sequence.len() > SYMBOL_CAPACITY {
        return None;
    }
    let mut code: u16 = 1;
    for symbol in sequence {
        code = (code << 1)
            | match symbol {
                Symbol::Dot => 0,
                Symbol::Dash => 1,
            };
    }
    Some(code)
}

/// Look up the character for a completed symbol sequence.
///
/// Covers letters A-Z, digits 0-9, and the standard punctuation
/// assignments up to six symbols. The international "error" sequence
/// (eight dots) and any other unknown sequence return None.
pub fn lookup(sequence: &[Symbol]) -> Option<char> {
    let code = pack(sequence)?;
    let ch = match code {
        // Letters
        0b101 => 'A',      // .-
        0b11000 => 'B',    // -...
        0b11010 => 'C',    // -.-.
        0b1100 => 'D',     // -..
        0b10 => 'E',       // .
        0b10010 => 'F',    // ..-.
        0b1110 => 'G',     // --.
        0b10000 => 'H',    // ....
        0b100 => 'I',      // ..
        0b10111 => 'J',    // .---
        0b1101 => 'K',     // -.-
        0b10100 => 'L',    // .-..
        0b111 => 'M',      // --
        0b110 => 'N',      // -.
        0b1111 => 'O',     // ---
        0b10110 => 'P',    // .--.
        0b11101 => 'Q',    // --.-
        0b1010 => 'R',     // .-.
        0b1000 => 'S',     // ...
        0b11 => 'T',       // -
        0b1001 => 'U',     // ..-
        0b10001 => 'V',    // ...-
        0b1011 => 'W',     // .--
        0b11001 => 'X',    // -..-
        0b11011 => 'Y',    // -.--
        0b11100 => 'Z',    // --..

        // Digits
        0b111111 => '0',   // -----
        0b101111 => '1',   // .----
        0b100111 => '2',   // ..---
        0b100011 => '3',   // ...--
        0b100001 => '4',   // ....-
        0b100000 => '5',   // .....
        0b110000 => '6',   // -....
        0b111000 => '7',   // --...
        0b111100 => '8',   // ---..
        0b111110 => '9',   // ----.

        // Punctuation
        0b1010101 => '.',  // .-.-.-
        0b1110011 => ',',  // --..--
        0b1001100 => '?',  // ..--..
        0b1011110 => '\'', // .----.
        0b1101011 => '!',  // -.-.--
        0b110010 => '/',   // -..-.
        0b110110 => '(',   // -.--.
        0b1101101 => ')',  // -.--.-
        0b101000 => '&',   // .-...
        0b1111000 => ':',  // ---...
        0b1101010 => ';',  // -.-.-.
        0b110001 => '=',   // -...-
        0b101010 => '+',   // .-.-.
        0b1100001 => '-',  // -....-
        0b1001101 => '_',  // ..--.-
        0b1010010 => '"',  // .-..-.
        0b1011010 => '@',  // .--.-.

        _ => return None,
    };
    Some(ch)
}
