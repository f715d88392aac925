/// Fails compilation when the condition does not hold.
///
/// ```
/// oodle1_foundation::const_assert!(u16::BITS == 16);
/// ```
#[macro_export]
macro_rules! const_assert {
    ($cond:expr $(,)?) => {
        const _: () = assert!($cond);
    };
    ($cond:expr, $msg:literal $(,)?) => {
        const _: () = assert!($cond, $msg);
    };
}

/// Rounds `len` up to the next multiple of `align`, which must be a power of
/// two.
///
/// ```
/// assert_eq!(oodle1_foundation::align_up(5, 4), 8);
/// assert_eq!(oodle1_foundation::align_up(8, 4), 8);
/// ```
#[inline]
pub const fn align_up(len: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (len + align - 1) & !(align - 1)
}
