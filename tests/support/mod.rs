pub mod heritage;
