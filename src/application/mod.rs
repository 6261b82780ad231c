pub mod ledger;
pub mod trade_form;
