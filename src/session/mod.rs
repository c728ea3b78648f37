pub(crate) mod aggregator_session;
