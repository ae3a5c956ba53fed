pub mod labels_sea;
