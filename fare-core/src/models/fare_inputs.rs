use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Flexibility;

/// Coerced snapshot of the fare section of the form.
///
/// The penalty fields are only charged when `flexibility` is
/// [`Flexibility::No`], but they are always carried so the derived state can
/// snapshot whatever the fields currently hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareInputs {
    pub base_old_fare: Decimal,
    pub base_new_fare: Decimal,
    pub flexibility: Flexibility,
    pub airline_penalty: Decimal,
    pub service_fee: Decimal,
}
