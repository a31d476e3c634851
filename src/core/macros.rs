//! 核心宏定义
//!
//! 提供统一的宏来减少配置结构体的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use trail_engine::impl_default;
///
/// struct SpawnSettings {
///     capacity: usize,
///     label: String,
/// }
///
/// impl_default!(SpawnSettings {
///     capacity: 1024,
///     label: String::from("fountain"),
/// });
///
/// assert_eq!(SpawnSettings::default().capacity, 1024);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {

    struct RateSettings {
        rate: f32,
        label: String,
    }

    impl_default!(RateSettings {
        rate: 0.5,
        label: String::new(),
    });

    #[test]
    fn test_impl_default() {
        let settings = RateSettings::default();

        assert_eq!(settings.rate, 0.5);
        assert_eq!(settings.label, "");
    }
}
