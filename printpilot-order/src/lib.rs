pub mod models;
pub mod ledger;
pub mod reports;

pub use models::{Order, Receipt};
pub use ledger::{
    Customer, CustomerPatch, Deposit, Expense, GoodwillTransaction, GoodwillType, LedgerError,
    NewCustomer, NewDeposit, NewExpense, NewGoodwill, NewSale, Sale,
};
pub use reports::{IncomeReport, PeriodActivity, ReportError, ReportPeriod};
