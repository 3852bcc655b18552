pub mod cubic_extension;
pub mod element;
pub mod goldilocks;
pub mod traits;

use cubic_extension::{CubicExtensionField, HasCubicNonResidue};
use element::FieldElement;
use goldilocks::Goldilocks;

/// The fixed non-residue `3` used to build the extension field `X` this
/// crate proves over: `X = F[t]/(t^3 - 3)`.
#[derive(Debug, Clone)]
pub struct DegreeThreeNonResidue;

impl HasCubicNonResidue<Goldilocks> for DegreeThreeNonResidue {
    fn residue() -> FieldElement<Goldilocks> {
        FieldElement::from(3u64)
    }
}

/// `F`, the Goldilocks prime field every base trace column lives in.
pub type F = Goldilocks;
pub type Fp = FieldElement<Goldilocks>;

/// `X`, the cubic extension field every extension column and the STARK's
/// randomness lives in.
pub type XField = CubicExtensionField<Goldilocks, DegreeThreeNonResidue>;
pub type Fx = FieldElement<XField>;

/// Embeds an `F`-element into `X`.
pub fn lift(a: &Fp) -> Fx {
    cubic_extension::lift(a)
}
