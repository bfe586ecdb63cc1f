mod bind;
pub mod de;
pub mod error;
mod options;
mod ser;
mod value;

pub use de::{
    from_slice, from_slice_into, from_slice_into_with_options, from_slice_with_options, from_str,
    from_str_into, from_str_into_with_options, from_str_with_options,
};
pub use error::{Error, Result};
pub use iniconf_lexer::Assignment;
pub use options::Options;
