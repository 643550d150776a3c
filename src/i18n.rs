// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 语言选择环境变量
pub const LANG_ENV: &str = "CLEANCITY_LANG";

/// 默认语言
pub const DEFAULT_LOCALE: &str = "fr";

/// 已提供翻译的语言
pub const SUPPORTED_LOCALES: &[&str] = &["fr", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"fr" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 规范化语言代码: "en_US.UTF-8" → "en"；不支持时返回默认语言
pub fn normalize_locale(raw: &str) -> &'static str {
    let lang = raw
        .trim()
        .split(|c: char| c == '_' || c == '-' || c == '.')
        .next()
        .unwrap_or("")
        .to_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .find(|l| **l == lang)
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// 按 CLEANCITY_LANG 设置语言,返回生效的语言代码
pub fn init_from_env() -> &'static str {
    let locale = std::env::var(LANG_ENV)
        .map(|v| normalize_locale(&v))
        .unwrap_or(DEFAULT_LOCALE);
    set_locale(locale);
    locale
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use cleancity_logistics::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use cleancity_logistics::i18n::t_with_args;
/// let msg = t_with_args("cli.input_missing", &[("detail", "rapport_anomalies.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
