use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("IO error"))]
    Io {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("CSV error"))]
    Csv {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: csv::Error,
    },
    #[snafu(display("AIS point is missing '{field}' required by the line format"))]
    MissingField {
        #[snafu(implicit)]
        location: Location,
        field: &'static str,
    },
    #[snafu(display("Render error: {message}"))]
    Render {
        #[snafu(implicit)]
        location: Location,
        message: String,
    },
}
