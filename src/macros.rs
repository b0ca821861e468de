/// Chains stages left to right: `pipe![a, b, c]` feeds the output of `a` into `b`
/// and the output of `b` into `c`.
#[macro_export]
macro_rules! pipe {
    ($s1:expr) => { $s1 };
    ($s1:expr, $($rest:expr),+ $(,)?) => {
        {
            use $crate::StageExt;
            $s1.pipe($crate::pipe!($($rest),+))
        }
    };
}
