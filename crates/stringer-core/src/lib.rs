pub mod check;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod forward;
pub mod generate;
pub mod lookup;
pub mod manifest;
pub mod normalize;
pub mod options;
pub mod runs;
pub mod table;
pub mod util;
pub mod value;
pub mod verify;

pub use error::{InputError, OptionsError};
pub use generate::{generate_file, generate_type, FileHeader, GeneratedFile, GeneratedType};
pub use options::GenerateOptions;
pub use value::{EnumType, IntKind, Value};
