// Copyright 2025 The Selas Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A macro for defining typed bitflag sets.
#[macro_export]
#[doc(hidden)]
macro_rules! selas_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            pub(crate) bits: $ty,
        }

        impl $name {
            /// An empty set of flags.
            pub const EMPTY: Self = Self { bits: 0 };

            /// Creates a flag set from raw bits. Bits that do not correspond
            /// to a defined flag are kept as-is.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw bits of the set.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Returns `true` if no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if every flag in `other` is also set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if `self` and `other` share at least one flag.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Sets the flags in `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the flags in `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Toggles the flags in `other`.
            pub fn toggle(&mut self, other: Self) {
                self.bits ^= other.bits;
            }

            /// Returns a copy of `self` with the flags in `other` set.
            #[must_use]
            pub const fn with(mut self, other: Self) -> Self {
                self.bits |= other.bits;
                self
            }

            /// Returns a copy of `self` with the flags in `other` cleared.
            #[must_use]
            pub const fn without(mut self, other: Self) -> Self {
                self.bits &= !other.bits;
                self
            }

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl core::ops::BitXor for $name {
            type Output = Self;
            fn bitxor(self, other: Self) -> Self {
                Self { bits: self.bits ^ other.bits }
            }
        }

        impl core::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self { bits: !self.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, other: Self) {
                self.bits &= other.bits;
            }
        }

        impl core::ops::BitXorAssign for $name {
            fn bitxor_assign(&mut self, other: Self) {
                self.bits ^= other.bits;
            }
        }

        // Allocation-free Debug listing the named flags, then any leftovers.
        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut bits = self.bits;
                let mut first_flag = true;

                write!(f, "{} {{ ", stringify!($name))?;

                $(
                    // Zero-valued flags would match everything; skip them.
                    if ($flag_value != 0) && (bits & $flag_value) == $flag_value {
                        if !first_flag {
                            write!(f, " | ")?;
                        }
                        write!(f, "{}", stringify!($flag_name))?;
                        bits &= !$flag_value;
                        first_flag = false;
                    }
                )*

                if bits != 0 {
                    if !first_flag {
                        write!(f, " | ")?;
                    }
                    write!(f, "UNKNOWN({:#x})", bits)?;
                    first_flag = false;
                }

                if self.bits == 0 && first_flag {
                    write!(f, "EMPTY")?;
                }

                write!(f, " }}")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::selas_bitflags;

    selas_bitflags! {
        /// Flag set used to exercise the macro.
        pub struct StageFlags: u32 {
            const VERTEX = 1 << 0;
            const FRAGMENT = 1 << 1;
            const COMPUTE = 1 << 2;
            const TRANSFER = 1 << 3;
            const RASTER = Self::VERTEX.bits() | Self::FRAGMENT.bits();
        }
    }

    #[test]
    fn empty_set() {
        let flags = StageFlags::EMPTY;
        assert!(flags.is_empty());
        assert!(flags.contains(StageFlags::EMPTY));
        assert!(!flags.contains(StageFlags::VERTEX));
        assert_eq!(StageFlags::default(), StageFlags::EMPTY);
        assert_eq!(format!("{flags:?}"), "StageFlags { EMPTY }");
    }

    #[test]
    fn contains_and_intersects() {
        let raster = StageFlags::RASTER;
        assert!(raster.contains(StageFlags::VERTEX));
        assert!(raster.contains(StageFlags::VERTEX | StageFlags::FRAGMENT));
        assert!(!raster.contains(StageFlags::COMPUTE));
        assert!(raster.intersects(StageFlags::FRAGMENT | StageFlags::COMPUTE));
        assert!(!raster.intersects(StageFlags::COMPUTE | StageFlags::TRANSFER));
        assert!(!raster.intersects(StageFlags::EMPTY));
    }

    #[test]
    fn mutating_operations() {
        let mut flags = StageFlags::VERTEX;
        flags.insert(StageFlags::COMPUTE);
        assert_eq!(flags, StageFlags::VERTEX | StageFlags::COMPUTE);
        flags.remove(StageFlags::VERTEX);
        assert_eq!(flags, StageFlags::COMPUTE);
        flags.toggle(StageFlags::COMPUTE | StageFlags::TRANSFER);
        assert_eq!(flags, StageFlags::TRANSFER);
    }

    #[test]
    fn builder_style_operations() {
        let flags = StageFlags::VERTEX
            .with(StageFlags::FRAGMENT)
            .without(StageFlags::VERTEX);
        assert_eq!(flags, StageFlags::FRAGMENT);
    }

    #[test]
    fn bit_operators() {
        let a = StageFlags::VERTEX | StageFlags::FRAGMENT;
        let b = StageFlags::FRAGMENT | StageFlags::COMPUTE;
        assert_eq!((a & b), StageFlags::FRAGMENT);
        assert_eq!((a ^ b), StageFlags::VERTEX | StageFlags::COMPUTE);
        let mut c = a;
        c |= StageFlags::TRANSFER;
        assert!(c.contains(StageFlags::TRANSFER));
        assert_eq!((!StageFlags::EMPTY).bits(), u32::MAX);
    }

    #[test]
    fn debug_formatting() {
        let flags = StageFlags::VERTEX | StageFlags::COMPUTE;
        assert_eq!(format!("{flags:?}"), "StageFlags { VERTEX | COMPUTE }");
        let with_unknown = StageFlags::from_bits_truncate((1 << 0) | (1 << 9));
        assert_eq!(
            format!("{with_unknown:?}"),
            "StageFlags { VERTEX | UNKNOWN(0x200) }"
        );
    }
}
