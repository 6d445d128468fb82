//! # Data model
//!
//! Items come in four flavours, one per [`DataMode`]. A [`Collection`] holds
//! items of a single mode and is the only way data enters a sort session, so
//! every algorithm can rely on all keys being mutually comparable.

pub mod generate;
pub mod key;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use key::{key_of, KeyFn, SortKey};

/// The four kinds of data the visualiser can sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Colors,
    Numbers,
    Words,
    Letters,
}

impl DataMode {
    pub const ALL: [DataMode; 4] = [
        DataMode::Colors,
        DataMode::Numbers,
        DataMode::Words,
        DataMode::Letters,
    ];

    /// Lowercase name used in history files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            DataMode::Colors => "colors",
            DataMode::Numbers => "numbers",
            DataMode::Words => "words",
            DataMode::Letters => "letters",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::UnknownMode(s.to_string()))
    }
}

/// An RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// One sortable item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Color(Rgb),
    Number(i64),
    Letter(char),
    Word(String),
}

impl Item {
    /// The mode this item belongs to
    pub fn mode(&self) -> DataMode {
        match self {
            Item::Color(_) => DataMode::Colors,
            Item::Number(_) => DataMode::Numbers,
            Item::Word(_) => DataMode::Words,
            Item::Letter(_) => DataMode::Letters,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Color(Rgb(r, g, b)) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Item::Number(n) => write!(f, "{}", n),
            Item::Word(w) => f.write_str(w),
            Item::Letter(c) => write!(f, "{}", c),
        }
    }
}

/// Errors raised while building or naming data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("item {index} belongs to mode '{found}', collection mode is '{expected}'")]
    ModeMismatch {
        index: usize,
        expected: DataMode,
        found: DataMode,
    },
    #[error("unknown data mode '{0}' (expected colors, numbers, words or letters)")]
    UnknownMode(String),
}

/// An ordered sequence of items of one mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    mode: DataMode,
    items: Vec<Item>,
}

impl Collection {
    /// Build a collection, rejecting items that belong to another mode.
    pub fn new(mode: DataMode, items: Vec<Item>) -> Result<Self, DataError> {
        if let Some((index, item)) = items.iter().enumerate().find(|(_, it)| it.mode() != mode) {
            return Err(DataError::ModeMismatch {
                index,
                expected: mode,
                found: item.mode(),
            });
        }
        Ok(Self { mode, items })
    }

    pub fn numbers(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            mode: DataMode::Numbers,
            items: values.into_iter().map(Item::Number).collect(),
        }
    }

    pub fn words<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            mode: DataMode::Words,
            items: values.into_iter().map(|w| Item::Word(w.into())).collect(),
        }
    }

    pub fn letters(values: impl IntoIterator<Item = char>) -> Self {
        Self {
            mode: DataMode::Letters,
            items: values.into_iter().map(Item::Letter).collect(),
        }
    }

    pub fn colors(values: impl IntoIterator<Item = Rgb>) -> Self {
        Self {
            mode: DataMode::Colors,
            items: values.into_iter().map(Item::Color).collect(),
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}
