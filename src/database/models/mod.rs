mod dataset;
mod ocfl_object_version;
mod tar;

pub use dataset::{
    normalize_title, Dataset, DatasetVersionExport, FileMeta, UnconfirmedVersionExport,
    TITLE_MAX_LENGTH,
};
pub use ocfl_object_version::{OcflObjectVersion, OcflObjectVersionRef};
pub use tar::{Tar, TarPart};
