//! Coarse character classes that drive the scanner's branching.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCode {
    Space,
    Letter,
    Digit,
    Plus,
    Minus,
    Times,
    Slash,
    LeftParen,
    RightParen,
    Equal,
    Less,
    Greater,
    Exclaim,
    Comma,
    Period,
    Colon,
    Semicolon,
    SingleQuote,
    DoubleQuote,
    Invalid,
}

const ASCII_TABLE: [CharCode; 128] = build_table();

const fn build_table() -> [CharCode; 128] {
    let mut table = [CharCode::Invalid; 128];

    let mut c = b'a';
    while c <= b'z' {
        table[c as usize] = CharCode::Letter;
        table[(c - b'a' + b'A') as usize] = CharCode::Letter;
        c += 1;
    }
    let mut d = b'0';
    while d <= b'9' {
        table[d as usize] = CharCode::Digit;
        d += 1;
    }

    table[b' ' as usize] = CharCode::Space;
    table[b'\t' as usize] = CharCode::Space;
    table[b'\n' as usize] = CharCode::Space;
    table[b'\r' as usize] = CharCode::Space;

    table[b'+' as usize] = CharCode::Plus;
    table[b'-' as usize] = CharCode::Minus;
    table[b'*' as usize] = CharCode::Times;
    table[b'/' as usize] = CharCode::Slash;
    table[b'(' as usize] = CharCode::LeftParen;
    table[b')' as usize] = CharCode::RightParen;
    table[b'=' as usize] = CharCode::Equal;
    table[b'<' as usize] = CharCode::Less;
    table[b'>' as usize] = CharCode::Greater;
    table[b'!' as usize] = CharCode::Exclaim;
    table[b',' as usize] = CharCode::Comma;
    table[b'.' as usize] = CharCode::Period;
    table[b':' as usize] = CharCode::Colon;
    table[b';' as usize] = CharCode::Semicolon;
    table[b'\'' as usize] = CharCode::SingleQuote;
    table[b'"' as usize] = CharCode::DoubleQuote;
    table
}

impl CharCode {
    /// Classify one character. Total: anything outside the ASCII table is `Invalid`.
    pub fn of(c: char) -> Self {
        if c.is_ascii() {
            ASCII_TABLE[c as usize]
        } else {
            CharCode::Invalid
        }
    }

    pub fn is_ident_part(self) -> bool {
        matches!(self, CharCode::Letter | CharCode::Digit)
    }
}
