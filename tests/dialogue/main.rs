mod flow;
mod support;
