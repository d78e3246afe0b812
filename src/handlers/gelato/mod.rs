//! Commands behind the Gelato routes. The routes do the network calls and
//! hand the results to these for the store work.

pub mod fulfilment;
pub mod sync;
