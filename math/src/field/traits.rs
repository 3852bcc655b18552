use std::fmt::Debug;

/// Trait to add field behaviour to a struct.
///
/// Implementors are zero-sized tag types (e.g. `Goldilocks`) that describe
/// arithmetic over `BaseType`; the generic [`crate::field::element::FieldElement`]
/// wrapper is what user code actually holds and passes around. Every method
/// here earns its place in `FieldElement`'s own operator impls
/// (`impl_binary_op!` wires `add`/`sub`/`mul`/`div` straight through,
/// `from_u64`/`from_base_type` back `From<u64>`/`new`) — there's no slack
/// left to trim without also cutting an operator a caller somewhere relies
/// on, which is why this stays a plain field-axioms interface rather than
/// splitting into smaller traits.
pub trait HasFieldOperations: Debug {
    /// The underlying base type for representing elements from the field.
    type BaseType: Clone + Debug;

    /// Returns the sum of `a` and `b`.
    fn add(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the multiplication of `a` and `b`.
    fn mul(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns `a` raised to the power of `exponent`.
    fn pow(a: &Self::BaseType, mut exponent: u128) -> Self::BaseType {
        let mut result = Self::one();
        let mut base = a.clone();

        while exponent > 0 {
            if exponent & 1 == 1 {
                result = Self::mul(&result, &base);
            }
            exponent >>= 1;
            base = Self::mul(&base, &base);
        }
        result
    }

    /// Returns the subtraction of `a` and `b`.
    fn sub(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the additive inverse of `a`.
    fn neg(a: &Self::BaseType) -> Self::BaseType;

    /// Returns the multiplicative inverse of `a`. Panics on zero; callers that
    /// need a recoverable error should check `eq(a, &zero())` first.
    fn inv(a: &Self::BaseType) -> Self::BaseType;

    /// Returns the division of `a` and `b`.
    fn div(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns a boolean indicating whether `a` and `b` are equal or not.
    fn eq(a: &Self::BaseType, b: &Self::BaseType) -> bool;

    /// Returns the additive neutral element.
    fn zero() -> Self::BaseType;

    /// Returns the multiplicative neutral element.
    fn one() -> Self::BaseType;

    /// Returns the element `x * 1` where 1 is the multiplicative neutral element.
    fn from_u64(x: u64) -> Self::BaseType;

    /// Takes as input an element of BaseType and returns the internal representation
    /// of that element in the field.
    fn from_base_type(x: Self::BaseType) -> Self::BaseType;
}

/// Marks a field as two-adic and exposes the data needed to build NTT domains:
/// a fixed primitive root of unity of order `2^TWO_ADICITY`, from which every
/// smaller power-of-two order's primitive root is derived by squaring.
pub trait IsFFTField: HasFieldOperations {
    const TWO_ADICITY: u64;

    /// A primitive `2^TWO_ADICITY`-th root of unity, given in `BaseType`.
    fn two_adic_primitive_root_of_unity() -> Self::BaseType;

    /// Returns a primitive `2^order`-th root of unity, for `order <= TWO_ADICITY`.
    fn primitive_root_of_unity(order: u64) -> Option<Self::BaseType> {
        if order > Self::TWO_ADICITY {
            return None;
        }
        let power = Self::TWO_ADICITY - order;
        let mut root = Self::two_adic_primitive_root_of_unity();
        for _ in 0..power {
            root = Self::mul(&root, &root);
        }
        Some(root)
    }

    fn field_name() -> &'static str;
}
