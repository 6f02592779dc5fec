/// Big number operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BnError {
    // Parsing errors
    #[error("radix must be between 2 and 36, got {0}")]
    InvalidRadix(u32),
    #[error("invalid character {ch:?} for radix {radix}")]
    InvalidDigit { ch: char, radix: u32 },
    #[error("empty digit string")]
    EmptyInput,

    // Conversion errors
    #[error("number can only safely store up to 53 bits")]
    NumberOverflow,
    #[error("byte array longer than desired length: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },
    #[error("requested array length must be positive")]
    InvalidLength,

    // Arithmetic errors
    #[error("division by zero")]
    DivisionByZero,
    #[error("operation requires non-negative operands")]
    NegativeOperand,
    #[error("negative exponent")]
    NegativeExponent,
    #[error("invalid modulus")]
    InvalidModulus,
    #[error("no modular inverse")]
    NoInverse,
    #[error("no modular square root")]
    NoSquareRoot,

    // Reduction context errors
    #[error("operation works only with numbers in a reduction context")]
    NotInRedContext,
    #[error("number is already in a reduction context")]
    AlreadyInRedContext,
    #[error("operands belong to different reduction contexts")]
    RedContextMismatch,
    #[error("unknown prime: {0}")]
    UnknownPrime(String),

    // Random generation
    #[error("random generation failed")]
    RandGenFail,
}
