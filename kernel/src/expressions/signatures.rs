//! The type-specialized scalar function signatures a coordinator can push down.
//!
//! Discriminants are the wire codes. The same logical operator appears once per operand type
//! (`LtInt`, `LtReal`, `LtString`, ...), because the coordinator resolves operand types before
//! shipping the plan.

use strum::{AsRefStr, Display, EnumIter, FromRepr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, FromRepr)]
#[repr(i32)]
pub enum ScalarFuncSig {
    // casts
    CastIntAsInt = 0,
    CastIntAsReal = 1,
    CastIntAsString = 2,
    CastIntAsDecimal = 3,
    CastIntAsTime = 4,
    CastIntAsDuration = 5,
    CastIntAsJson = 6,
    CastRealAsInt = 10,
    CastRealAsReal = 11,
    CastRealAsString = 12,
    CastRealAsDecimal = 13,
    CastRealAsTime = 14,
    CastRealAsDuration = 15,
    CastRealAsJson = 16,
    CastDecimalAsInt = 20,
    CastDecimalAsReal = 21,
    CastDecimalAsString = 22,
    CastDecimalAsDecimal = 23,
    CastDecimalAsTime = 24,
    CastDecimalAsDuration = 25,
    CastDecimalAsJson = 26,
    CastStringAsInt = 30,
    CastStringAsReal = 31,
    CastStringAsString = 32,
    CastStringAsDecimal = 33,
    CastStringAsTime = 34,
    CastStringAsDuration = 35,
    CastStringAsJson = 36,
    CastTimeAsInt = 40,
    CastTimeAsReal = 41,
    CastTimeAsString = 42,
    CastTimeAsDecimal = 43,
    CastTimeAsTime = 44,
    CastTimeAsDuration = 45,
    CastTimeAsJson = 46,
    CastDurationAsInt = 50,
    CastDurationAsReal = 51,
    CastDurationAsString = 52,
    CastDurationAsDecimal = 53,
    CastDurationAsTime = 54,
    CastDurationAsDuration = 55,
    CastDurationAsJson = 56,
    CastJsonAsInt = 60,
    CastJsonAsReal = 61,
    CastJsonAsString = 62,
    CastJsonAsDecimal = 63,
    CastJsonAsTime = 64,
    CastJsonAsDuration = 65,
    CastJsonAsJson = 66,

    // comparisons
    LtInt = 100,
    LtReal = 101,
    LtDecimal = 102,
    LtString = 103,
    LtTime = 104,
    LtDuration = 105,
    LtJson = 106,
    LeInt = 110,
    LeReal = 111,
    LeDecimal = 112,
    LeString = 113,
    LeTime = 114,
    LeDuration = 115,
    LeJson = 116,
    GtInt = 120,
    GtReal = 121,
    GtDecimal = 122,
    GtString = 123,
    GtTime = 124,
    GtDuration = 125,
    GtJson = 126,
    GeInt = 130,
    GeReal = 131,
    GeDecimal = 132,
    GeString = 133,
    GeTime = 134,
    GeDuration = 135,
    GeJson = 136,
    EqInt = 140,
    EqReal = 141,
    EqDecimal = 142,
    EqString = 143,
    EqTime = 144,
    EqDuration = 145,
    EqJson = 146,
    NeInt = 150,
    NeReal = 151,
    NeDecimal = 152,
    NeString = 153,
    NeTime = 154,
    NeDuration = 155,
    NeJson = 156,
    NullEqInt = 160,
    NullEqReal = 161,
    NullEqDecimal = 162,
    NullEqString = 163,
    NullEqTime = 164,
    NullEqDuration = 165,
    NullEqJson = 166,

    // arithmetic
    PlusReal = 200,
    PlusDecimal = 201,
    PlusInt = 203,
    MinusReal = 204,
    MinusDecimal = 205,
    MinusInt = 207,
    MultiplyReal = 208,
    MultiplyDecimal = 209,
    MultiplyInt = 210,
    DivideReal = 211,
    DivideDecimal = 212,
    IntDivideInt = 213,
    IntDivideDecimal = 214,
    ModReal = 215,
    ModDecimal = 216,
    ModInt = 217,
    MultiplyIntUnsigned = 218,

    // math
    AbsInt = 2101,
    AbsUInt = 2102,
    AbsReal = 2103,
    AbsDecimal = 2104,
    CeilIntToDec = 2105,
    CeilIntToInt = 2106,
    CeilDecToInt = 2107,
    CeilDecToDec = 2108,
    CeilReal = 2109,
    FloorIntToDec = 2110,
    FloorIntToInt = 2111,
    FloorDecToInt = 2112,
    FloorDecToDec = 2113,
    FloorReal = 2114,
    RoundReal = 2121,
    RoundInt = 2122,
    RoundDec = 2123,
    Log1Arg = 2131,
    Log2Args = 2132,
    Log2 = 2133,
    Log10 = 2134,
    Rand = 2135,
    Pow = 2137,
    Conv = 2138,
    Crc32 = 2140,
    Sign = 2141,
    Sqrt = 2142,
    Exp = 2152,
    Pi = 2153,

    // logical, null tests and bit operations
    LogicalAnd = 3101,
    LogicalOr = 3102,
    LogicalXor = 3103,
    UnaryNotInt = 3104,
    UnaryNotDecimal = 3105,
    UnaryNotReal = 3106,
    UnaryMinusInt = 3108,
    UnaryMinusReal = 3109,
    UnaryMinusDecimal = 3110,
    DecimalIsNull = 3111,
    DurationIsNull = 3112,
    RealIsNull = 3113,
    StringIsNull = 3114,
    TimeIsNull = 3115,
    IntIsNull = 3116,
    JsonIsNull = 3117,
    BitAndSig = 3118,
    BitOrSig = 3119,
    BitXorSig = 3120,
    BitNegSig = 3121,
    IntIsTrue = 3122,
    RealIsTrue = 3123,
    DecimalIsTrue = 3124,
    IntIsFalse = 3125,
    RealIsFalse = 3126,
    DecimalIsFalse = 3127,
    LeftShift = 3129,
    RightShift = 3130,

    // set membership, control flow and pattern matching
    InInt = 4001,
    InReal = 4002,
    InDecimal = 4003,
    InString = 4004,
    InTime = 4005,
    InDuration = 4006,
    InJson = 4007,
    IfNullInt = 4101,
    IfNullReal = 4102,
    IfNullDecimal = 4103,
    IfNullString = 4104,
    IfNullTime = 4105,
    IfNullDuration = 4106,
    IfInt = 4107,
    IfReal = 4108,
    IfDecimal = 4109,
    IfString = 4110,
    IfTime = 4111,
    IfDuration = 4112,
    IfNullJson = 4113,
    IfJson = 4114,
    CaseWhenInt = 4208,
    CaseWhenReal = 4209,
    CaseWhenDecimal = 4210,
    CaseWhenString = 4211,
    CaseWhenTime = 4212,
    CaseWhenDuration = 4213,
    CaseWhenJson = 4214,
    CoalesceInt = 4201,
    CoalesceReal = 4202,
    CoalesceDecimal = 4203,
    CoalesceString = 4204,
    CoalesceTime = 4205,
    CoalesceDuration = 4206,
    CoalesceJson = 4207,
    LikeSig = 4310,
    RegexpSig = 4311,
    RegexpUtf8Sig = 4312,

    // JSON
    JsonExtractSig = 5001,
    JsonUnquoteSig = 5002,
    JsonTypeSig = 5003,
    JsonSetSig = 5004,
    JsonInsertSig = 5005,
    JsonReplaceSig = 5006,
    JsonRemoveSig = 5007,
    JsonMergeSig = 5008,
    JsonObjectSig = 5009,
    JsonArraySig = 5010,
    JsonValidJsonSig = 5011,
    JsonContainsSig = 5012,
    JsonLengthSig = 5016,

    // date and time
    DateFormatSig = 6001,
    DateLiteral = 6002,
    DateDiff = 6003,
    NullTimeDiff = 6004,
    TimeStringTimeDiff = 6005,
    DurationDurationTimeDiff = 6006,
    StringTimeTimeDiff = 6009,
    TimeTimeTimeDiff = 6013,
    Date = 6014,
    Hour = 6015,
    Minute = 6016,
    Second = 6017,
    MicroSecond = 6018,
    Month = 6019,
    MonthName = 6020,
    NowWithArg = 6021,
    NowWithoutArg = 6022,
    DayName = 6023,
    DayOfMonth = 6024,
    DayOfWeek = 6025,
    DayOfYear = 6026,
    Year = 6036,
    UnixTimestampCurrent = 6041,
    UnixTimestampInt = 6042,
    UnixTimestampDec = 6043,
    FromUnixTime1Arg = 6056,
    FromUnixTime2Arg = 6057,
    ExtractDatetime = 6058,
    AddDateStringInt = 6067,
    AddDateDatetimeInt = 6071,
    SubDateStringInt = 6081,
    SubDateDatetimeInt = 6085,

    // string
    BitLength = 7001,
    Bin = 7002,
    Ascii = 7003,
    Char = 7004,
    CharLengthUtf8 = 7005,
    Concat = 7006,
    ConcatWs = 7007,
    Convert = 7008,
    Elt = 7009,
    ExportSet3Arg = 7010,
    FieldInt = 7013,
    FieldReal = 7014,
    FieldString = 7015,
    FindInSet = 7016,
    Format = 7017,
    FromBase64 = 7019,
    HexIntArg = 7020,
    HexStrArg = 7021,
    InsertUtf8 = 7023,
    InstrUtf8 = 7025,
    Lower = 7027,
    LeftUtf8 = 7029,
    Length = 7030,
    LocateUtf8 = 7034,
    LpadUtf8 = 7036,
    Ltrim = 7037,
    OctString = 7040,
    Quote = 7041,
    Repeat = 7042,
    Replace = 7043,
    ReverseUtf8 = 7045,
    RightUtf8 = 7047,
    RpadUtf8 = 7049,
    Rtrim = 7050,
    Space = 7051,
    Strcmp = 7052,
    Substring2ArgsUtf8 = 7054,
    Substring3ArgsUtf8 = 7056,
    SubstringIndex = 7057,
    ToBase64 = 7058,
    Trim1Arg = 7059,
    Trim2Args = 7060,
    Trim3Args = 7061,
    UnHex = 7062,
    UpperUtf8 = 7063,

    // encryption, hashing and system information
    AesDecrypt = 8001,
    AesEncrypt = 8002,
    Compress = 8003,
    Md5 = 8004,
    Password = 8005,
    RandomBytes = 8006,
    Sha1 = 8007,
    Sha2 = 8008,
    Uncompress = 8009,
    UncompressedLength = 8010,
    Database = 9001,
    FoundRows = 9002,
    CurrentUser = 9003,
    User = 9004,
    ConnectionId = 9005,
    LastInsertId = 9006,
    LastInsertIdWithId = 9007,
    Version = 9008,
    TiDbVersion = 9009,
    RowCount = 9010,
    Sleep = 10001,
    Lock = 10002,
    ReleaseLock = 10003,
    DecimalAnyValue = 10004,
    DurationAnyValue = 10005,
    IntAnyValue = 10006,
    JsonAnyValue = 10007,
    RealAnyValue = 10008,
    StringAnyValue = 10009,
    TimeAnyValue = 10010,
    InetAton = 10011,
    InetNtoa = 10012,
    Inet6Aton = 10013,
    Inet6Ntoa = 10014,
    IsIPv4 = 10015,
    IsIPv6 = 10018,
    Uuid = 10021,
}

impl ScalarFuncSig {
    /// Looks up a wire code. Unknown codes are legal input and simply have no signature.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_repr(code)
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}
