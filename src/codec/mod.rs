pub(crate) mod pgm;
