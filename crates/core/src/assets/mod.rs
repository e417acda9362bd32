//! Assets module - domain models and the persistence seam.

mod assets_model;
mod assets_traits;


pub use assets_model::{Asset, AssetFamily, AssetStatus, Currency, NewAssetInput};
pub use assets_traits::AssetRepositoryTrait;
