mod binary;
mod run;
