pub(crate) mod histogram;
