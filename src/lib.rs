#[doc(inline)]
pub use carto;
#[doc(inline)]
pub use inf;
