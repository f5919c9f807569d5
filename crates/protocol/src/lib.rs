//! The instruction stream understood by the rover's motor controller.
//!
//! Every instruction is a single ASCII character, and a program is just the
//! concatenation of its instructions.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use domino_geom::LeftRight;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Drop a domino at the current position.
    DropDomino,
    BothForward,
    BothBackward,
    LeftForward,
    RightForward,
    LeftBackward,
    RightBackward,
}

impl Token {
    pub const ALL: [Token; 7] = [
        Token::DropDomino,
        Token::BothForward,
        Token::BothBackward,
        Token::LeftForward,
        Token::RightForward,
        Token::LeftBackward,
        Token::RightBackward,
    ];

    pub fn as_char(self) -> char {
        match self {
            Token::DropDomino => 'F',
            Token::BothForward => 'W',
            Token::BothBackward => 'I',
            Token::LeftForward => 'D',
            Token::RightForward => 'A',
            Token::LeftBackward => 'J',
            Token::RightBackward => 'L',
        }
    }

    /// How many steps each wheel moves for this instruction. Forward is
    /// positive.
    pub fn wheel_steps(self) -> LeftRight<i32> {
        let (left, right) = match self {
            Token::DropDomino => (0, 0),
            Token::BothForward => (1, 1),
            Token::BothBackward => (-1, -1),
            Token::LeftForward => (1, 0),
            Token::RightForward => (0, 1),
            Token::LeftBackward => (-1, 0),
            Token::RightBackward => (0, -1),
        };
        LeftRight { left, right }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown instruction {ch:?} at position {position}")]
pub struct UnknownToken {
    pub position: usize,
    pub ch: char,
}

impl TryFrom<char> for Token {
    type Error = char;

    fn try_from(ch: char) -> Result<Token, char> {
        Token::ALL
            .into_iter()
            .find(|t| t.as_char() == ch)
            .ok_or(ch)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An ordered program of instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    tokens: Vec<Token>,
}

impl Instructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn count(&self, token: Token) -> usize {
        self.tokens.iter().filter(|&&t| t == token).count()
    }

    /// The number of dominoes this program places.
    pub fn drops(&self) -> usize {
        self.count(Token::DropDomino)
    }

    /// The net number of steps each wheel turns over the whole program.
    pub fn wheel_steps(&self) -> LeftRight<i64> {
        self.tokens.iter().fold(LeftRight::default(), |acc, t| {
            let steps = t.wheel_steps();
            LeftRight {
                left: acc.left + i64::from(steps.left),
                right: acc.right + i64::from(steps.right),
            }
        })
    }
}

impl Extend<Token> for Instructions {
    fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

impl FromIterator<Token> for Instructions {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Instructions {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Instructions {
    type Item = &'a Token;
    type IntoIter = core::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.tokens {
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

impl core::str::FromStr for Instructions {
    type Err = UnknownToken;

    /// Parses a program, skipping any whitespace between instructions.
    fn from_str(s: &str) -> Result<Self, UnknownToken> {
        s.char_indices()
            .filter(|(_, ch)| !ch.is_whitespace())
            .map(|(position, ch)| Token::try_from(ch).map_err(|ch| UnknownToken { position, ch }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use proptest::prelude::*;

    #[test]
    fn chars_are_distinct() {
        for a in Token::ALL {
            assert_eq!(Token::try_from(a.as_char()), Ok(a));
            for b in Token::ALL {
                assert!(a == b || a.as_char() != b.as_char());
            }
        }
        assert_eq!(Token::try_from('x'), Err('x'));
    }

    #[test]
    fn parse_and_tally() {
        let prog: Instructions = "FWW A\nAI JL D".parse().unwrap();
        assert_eq!(prog.len(), 9);
        assert_eq!(prog.drops(), 1);
        assert_eq!(prog.count(Token::RightForward), 2);
        assert_eq!(prog.wheel_steps(), LeftRight { left: 1, right: 2 });
        assert_eq!(prog.to_string(), "FWWAAIJLD");
    }

    #[test]
    fn parse_error_position() {
        let err = "FWxW".parse::<Instructions>().unwrap_err();
        assert_eq!(err, UnknownToken { position: 2, ch: 'x' });
    }

    proptest! {
        #[test]
        fn display_parses_back(idxs in proptest::collection::vec(0..Token::ALL.len(), 0..64)) {
            let prog: Instructions = idxs.iter().map(|&i| Token::ALL[i]).collect();
            let text = prog.to_string();
            prop_assert_eq!(text.len(), prog.len());
            prop_assert_eq!(text.parse::<Instructions>().unwrap(), prog);
        }
    }
}
