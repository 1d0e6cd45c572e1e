/// egui surface: sidebar and menu, chart drawing, preview table.
pub mod panels;
pub mod plot;
pub mod table;
