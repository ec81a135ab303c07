use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Kernel names become function names in the emitted source.
    #[snafu(display("kernel name {name:?} is not a valid identifier"))]
    InvalidKernelName { name: String },
}
