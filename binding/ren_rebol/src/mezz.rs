//! Library functions written in the interpreted language itself, evaluated
//! into `lib` during initialization.

pub(crate) const MEZZANINE: &str = r#"
probe: func [value] [print mold :value :value]

does: func [body [block!]] [func [] body]

context: func [spec [block!]] [make object! spec]

unless: func [condition block [block!]] [if not :condition block]

empty?: func [series] [tail? series]

second: func [series] [pick series 2]

third: func [series] [pick series 3]

found?: func [value] [not none? :value]

join: func [value rest] [
    value: either series? :value [copy value] [form :value]
    append value either block? :rest [reduce rest] [rest]
]

rejoin: func [block [block!] /local values result] [
    values: reduce block
    if empty? values [return copy ""]
    result: either series? first values [copy first values] [form first values]
    append result next values
]

attempt: func [block [block!] /local result] [
    either error? result: try block [none] [:result]
]
"#;
