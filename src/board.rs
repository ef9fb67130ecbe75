use clap::ValueEnum;
use std::fmt;

/// Hardware revision the firmware is built for.
///
/// Only the label ends up in the generated header; nothing else branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BoardType {
    #[default]
    #[value(name = "devboard")]
    Devboard,
    #[value(name = "rev1")]
    Rev1,
    #[value(name = "plug")]
    Plug,
    #[value(name = "old_rev")]
    OldRev,
}

impl BoardType {
    pub fn label(&self) -> &'static str {
        match self {
            BoardType::Devboard => "devboard",
            BoardType::Rev1 => "rev1",
            BoardType::Plug => "plug",
            BoardType::OldRev => "old_rev",
        }
    }
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
