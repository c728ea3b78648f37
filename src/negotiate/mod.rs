pub(crate) mod negotiator;
