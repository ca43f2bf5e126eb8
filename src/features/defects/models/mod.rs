mod defect;

pub use defect::{Defect, DefectChanges, DefectStatus, NewDefect, Priority, Severity};
