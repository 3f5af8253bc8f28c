use std::cmp::Ordering;

/// An element that can be stored in a [`Lane`].
///
/// Elements are ordered against each other with [`cmp_element`], and against
/// a bare position with [`cmp_position`]. The two relations must agree: if
/// `a` orders before position `p` and `p` orders before `b`, then `a` must
/// order before `b`, and so on for every combination. The lane never checks
/// this law.
///
/// An element may change the position it compares to after it has been
/// inserted (a vehicle moving along a road, for example). Doing so is legal,
/// but every lane operation other than [`Lane::is_still_sorted`] and
/// [`Lane::validate`] assumes that the order of the stored elements still
/// matches the order they were inserted in. Running any other operation on a
/// lane whose order has been broken gives unspecified (but memory-safe)
/// results.
///
/// # Examples
///
/// ```
/// use lane_tree::{Lane, LaneElement};
/// use std::cmp::Ordering;
///
/// #[derive(Debug, PartialEq)]
/// struct Car {
///     id: u32,
///     position: f64,
/// }
///
/// impl LaneElement for Car {
///     fn cmp_element(&self, other: &Self) -> Ordering {
///         self.cmp_position(other.position)
///     }
///     fn cmp_position(&self, position: f64) -> Ordering {
///         self.position.partial_cmp(&position).unwrap_or(Ordering::Equal)
///     }
/// }
///
/// let mut lane = Lane::new();
/// lane.push_back(Car { id: 1, position: 12.0 });
/// lane.push_back(Car { id: 2, position: 3.5 });
///
/// let ahead = lane.upper_bound(5.0);
/// assert_eq!(ahead.current().map(|car| car.id), Some(1));
/// ```
///
/// [`Lane`]: crate::Lane
/// [`Lane::is_still_sorted`]: crate::Lane::is_still_sorted
/// [`Lane::validate`]: crate::Lane::validate
/// [`cmp_element`]: LaneElement::cmp_element
/// [`cmp_position`]: LaneElement::cmp_position
pub trait LaneElement {
    /// Orders `self` against another element.
    fn cmp_element(&self, other: &Self) -> Ordering;

    /// Orders `self` against a bare position.
    fn cmp_position(&self, position: f64) -> Ordering;

    fn less_than(&self, other: &Self) -> bool {
        self.cmp_element(other) == Ordering::Less
    }

    fn less_than_position(&self, position: f64) -> bool {
        self.cmp_position(position) == Ordering::Less
    }

    fn equals(&self, other: &Self) -> bool {
        self.cmp_element(other) == Ordering::Equal
    }

    fn equals_position(&self, position: f64) -> bool {
        self.cmp_position(position) == Ordering::Equal
    }
}

/// A key the lane can be searched by.
///
/// Implemented for `f64` (a bare position) and for `&T` (a peer element),
/// so every search method accepts either:
///
/// ```
/// use lane_tree::Lane;
///
/// let lane = Lane::from([1.0, 2.0, 2.5, 3.0]);
/// assert_eq!(lane.find(2.5).current(), Some(&2.5));
/// assert_eq!(lane.find(&2.5).current(), Some(&2.5));
/// ```
pub trait Probe<T: ?Sized> {
    /// Returns where `element` sits relative to this key.
    fn order_of(&self, element: &T) -> Ordering;
}

impl<T: LaneElement + ?Sized> Probe<T> for f64 {
    #[inline]
    fn order_of(&self, element: &T) -> Ordering {
        element.cmp_position(*self)
    }
}

impl<T: LaneElement + ?Sized> Probe<T> for &T {
    #[inline]
    fn order_of(&self, element: &T) -> Ordering {
        element.cmp_element(self)
    }
}

/// Total comparison of two floats: `partial_cmp` where it is defined (so that
/// `-0.0 == 0.0`), `total_cmp` for NaN.
#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer against a float.
///
/// Casting the integer to `f64` rounds above 2<sup>53</sup>, so the float is
/// split into its integral part, which is exact, and its fraction instead.
#[inline]
fn cmp_int_position(value: i128, position: f64) -> Ordering {
    if position.is_nan() {
        return cmp_f64(value as f64, position);
    }
    if position >= i128::MAX as f64 {
        return Ordering::Less;
    }
    if position < i128::MIN as f64 {
        return Ordering::Greater;
    }
    let whole = position.floor();
    match value.cmp(&(whole as i128)) {
        Ordering::Equal if position > whole => Ordering::Less,
        ordering => ordering,
    }
}

macro_rules! impl_lane_element_int {
    ($($INT:ty),*) => {
        $(
            impl LaneElement for $INT {
                #[inline]
                fn cmp_element(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
                #[inline]
                fn cmp_position(&self, position: f64) -> Ordering {
                    cmp_int_position(*self as i128, position)
                }
            }
        )*
    };
}

impl_lane_element_int!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize);

impl LaneElement for f32 {
    #[inline]
    fn cmp_element(&self, other: &Self) -> Ordering {
        self.partial_cmp(other)
            .unwrap_or_else(|| self.total_cmp(other))
    }
    #[inline]
    fn cmp_position(&self, position: f64) -> Ordering {
        cmp_f64(f64::from(*self), position)
    }
}

impl LaneElement for f64 {
    #[inline]
    fn cmp_element(&self, other: &Self) -> Ordering {
        cmp_f64(*self, *other)
    }
    #[inline]
    fn cmp_position(&self, position: f64) -> Ordering {
        cmp_f64(*self, position)
    }
}

#[cfg(test)]
mod tests {
    use super::{LaneElement, Probe};
    use std::cmp::Ordering;

    #[test]
    fn primitive_relations() {
        assert!(1_i32.less_than(&2));
        assert!(1_i32.less_than_position(1.5));
        assert!(2_u8.equals_position(2.0));
        assert!(!2_u8.equals_position(2.5));
        assert!(3.0_f64.equals(&3.0));
        assert!(0.0_f64.equals_position(-0.0));
        assert_eq!(2.5_f32.cmp_position(2.5), Ordering::Equal);
    }

    #[test]
    fn wide_integers_compare_exactly() {
        let a: i64 = 1 << 53;
        let b = a + 1;
        let p = a as f64;
        assert!(a.equals_position(p));
        assert!(!b.equals_position(p));
        assert_eq!(b.cmp_position(p), Ordering::Greater);
        assert_eq!(u64::MAX.cmp_position(u64::MAX as f64), Ordering::Less);
        assert_eq!(i64::MIN.cmp_position(i64::MIN as f64), Ordering::Equal);
        assert_eq!(3_usize.cmp_position(3.5), Ordering::Less);
        assert_eq!((-3_isize).cmp_position(-3.5), Ordering::Greater);
        assert_eq!(0_u8.cmp_position(f64::NEG_INFINITY), Ordering::Greater);
        assert_eq!(i64::MAX.cmp_position(f64::INFINITY), Ordering::Less);

        let lane = crate::Lane::from([a, b]);
        assert_eq!(lane.count(p), 1);
        assert_eq!(lane.upper_bound(p).current(), Some(&b));
    }

    #[test]
    fn nan_is_ordered() {
        assert_eq!(f64::NAN.cmp_element(&f64::NAN), Ordering::Equal);
        assert_ne!(1.0_f64.cmp_position(f64::NAN), Ordering::Equal);
    }

    #[test]
    fn probe_by_position_and_element() {
        assert_eq!(Probe::<i32>::order_of(&2.5, &2), Ordering::Less);
        assert_eq!(Probe::<i32>::order_of(&2.5, &3), Ordering::Greater);
        assert_eq!((&7_i64).order_of(&7), Ordering::Equal);
        assert_eq!((&7_i64).order_of(&9), Ordering::Greater);
    }
}
