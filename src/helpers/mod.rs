pub mod calendar;
pub mod canvas;
pub mod pdf;
