pub mod gocover;

use crate::error::Result;
use crate::model::Snapshot;

/// Every profile parser implements this trait.
pub trait Parser {
    /// Parse the input bytes into our uniform coverage model.
    fn parse(&self, input: &[u8]) -> Result<Snapshot>;
}
