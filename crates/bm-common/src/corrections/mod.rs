pub mod cefr;
pub mod tags;
pub mod work_mode;

pub use cefr::{correct_cefr, Cefr};
pub use tags::{normalize_tag, normalize_tag_set};
pub use work_mode::correct_work_mode;
