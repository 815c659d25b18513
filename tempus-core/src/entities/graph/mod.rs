pub mod tgraph;
