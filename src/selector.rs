//! Crop selection.

use tracing::trace;

use crate::catalog::{Catalog, CropProfile};
use crate::random::RandomSource;

/// Pick one crop uniformly at random.
///
/// The choice does not look at any soil or weather reading; every entry in
/// the catalog is equally likely.
pub fn select_crop<'a>(catalog: &'a Catalog, rng: &mut impl RandomSource) -> &'a CropProfile {
    let crops = catalog.crops();
    let u = rng.next_uniform();
    // u < 1.0, so the product is below len; the min guards against rounding.
    let index = ((u * crops.len() as f64) as usize).min(crops.len() - 1);
    trace!(draw = u, index, "crop_selected");
    &crops[index]
}
