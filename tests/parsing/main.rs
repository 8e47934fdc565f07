mod diagnostics;
mod directives;
mod samples;
mod visitors;
