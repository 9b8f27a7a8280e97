use crate::assets::Asset;
use crate::types::ZakatCalculationResult;

/// Anything that can turn a snapshot of assets into a zakat result.
///
/// Implementations must be pure: the same assets, in any order, give the
/// same result, and malformed assets never cause a panic.
pub trait CalculateZakat {
    fn calculate_zakat(&self, assets: &[Asset]) -> ZakatCalculationResult;
}
