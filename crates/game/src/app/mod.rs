mod bootstrap;
mod demo;
mod loop_runner;
mod scene_file;

pub(crate) use loop_runner::run;
