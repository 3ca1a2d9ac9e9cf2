use fancy_regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    /// The following regex is used to extract constructor bytecode information
    pub static ref CONSTRUCTOR_REGEX: Regex = Regex::new(concat!(
        r"(?:5b)?(?:60([a-f0-9]{2})|61([a-f0-9_]{4})|62([a-f0-9_]{6}))80",
        r"(?:60([a-f0-9]{2})|61([a-f0-9_]{4})|62([a-f0-9_]{6}))6000396000f3fe",
    ))
    .expect("failed to compile regex");

    /// The following regex matches a function or event signature, capturing the name and the
    /// parameter list. I.e. `transfer(address,uint256)`
    pub static ref SIGNATURE_REGEX: Regex =
        Regex::new(r"^([A-Za-z_$][A-Za-z0-9_$]*)\s*\((.*)\)$").expect("failed to compile regex");

    /// The following regex matches integer type names, capturing the signedness and the
    /// (optional) bit width. I.e. `uint`, `int8`, `uint256`
    pub static ref INTEGER_TYPE_REGEX: Regex =
        Regex::new(r"^(u?int)(\d*)$").expect("failed to compile regex");

    /// The following regex matches fixed-size byte string type names. I.e. `bytes32`
    pub static ref FIXED_BYTES_TYPE_REGEX: Regex =
        Regex::new(r"^bytes(\d+)$").expect("failed to compile regex");

    /// The following regex matches fixed-point type names, which are recognized but have no
    /// codec rule. I.e. `fixed`, `ufixed128x18`
    pub static ref FIXED_POINT_TYPE_REGEX: Regex =
        Regex::new(r"^u?fixed(\d+x\d+)?$").expect("failed to compile regex");

    /// The following regex validates a complete array suffix. I.e. `[3][]`
    pub static ref ARRAY_SUFFIX_REGEX: Regex =
        Regex::new(r"^(?:\[\d*\])*$").expect("failed to compile regex");

    /// The following regex captures each dimension of an array suffix, in textual order
    pub static ref ARRAY_DIMENSION_REGEX: Regex =
        Regex::new(r"\[(\d*)\]").expect("failed to compile regex");
}
