mod artifact;
mod file_name;
mod hash;
mod merge;
mod probe;

#[rustfmt::skip]
pub use {
    artifact::*,
    file_name::*,
    hash::*,
    merge::*,
    probe::*,
};
