pub mod ai;
pub mod fields;
pub mod respondent;
pub mod steps;
pub mod submissions;
pub mod wizards;
