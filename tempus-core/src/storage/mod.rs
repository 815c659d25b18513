pub mod timeindex;
