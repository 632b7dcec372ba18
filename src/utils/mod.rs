mod canonical;

pub use canonical::canonicalize;
