/*!
Record model shared by the decoders and the extraction passes.
*/
mod codes;
mod record;

pub use codes::CodeSet;
pub use record::*;
