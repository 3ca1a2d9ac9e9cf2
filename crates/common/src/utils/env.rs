/// Gets the value of an environment variable.
///
/// # Arguments
///
/// * `key` - The environment variable name to retrieve
///
/// # Returns
///
/// * `Option<String>` - The environment variable value if it exists and is not empty
pub fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
