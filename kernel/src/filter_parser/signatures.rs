//! Which scalar function signatures can be compiled into a rough-set filter, and as what.
//!
//! The match below is exhaustive on purpose: a signature added to [`ScalarFuncSig`] does not
//! compile until it is placed here. Supporting a new signature is a matter of moving it from a
//! `None` arm to the arm of its filter kind.

use strum::{AsRefStr, Display};

use crate::expressions::ScalarFuncSig;
use crate::rs_operator::CompareOp;

/// The kind of filter node a supported signature compiles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum RsFilterType {
    Compare(CompareOp),
    And,
    Or,
    Not,
}

/// The filter kind of a signature, or `None` if it cannot be compiled into a filter.
pub fn filter_type_of(sig: ScalarFuncSig) -> Option<RsFilterType> {
    use ScalarFuncSig::*;
    match sig {
        LtInt | LtReal | LtDecimal | LtString | LtTime | LtDuration | LtJson => {
            Some(RsFilterType::Compare(CompareOp::Less))
        }
        LeInt | LeReal | LeDecimal | LeString | LeTime | LeDuration | LeJson => {
            Some(RsFilterType::Compare(CompareOp::LessEqual))
        }
        GtInt | GtReal | GtDecimal | GtString | GtTime | GtDuration | GtJson => {
            Some(RsFilterType::Compare(CompareOp::Greater))
        }
        GeInt | GeReal | GeDecimal | GeString | GeTime | GeDuration | GeJson => {
            Some(RsFilterType::Compare(CompareOp::GreaterEqual))
        }
        EqInt | EqReal | EqDecimal | EqString | EqTime | EqDuration | EqJson => {
            Some(RsFilterType::Compare(CompareOp::Equal))
        }
        NeInt | NeReal | NeDecimal | NeString | NeTime | NeDuration | NeJson => {
            Some(RsFilterType::Compare(CompareOp::NotEqual))
        }
        LogicalAnd => Some(RsFilterType::And),
        LogicalOr => Some(RsFilterType::Or),
        UnaryNotInt | UnaryNotDecimal | UnaryNotReal => Some(RsFilterType::Not),

        // casts
        CastIntAsInt | CastIntAsReal | CastIntAsString | CastIntAsDecimal | CastIntAsTime
        | CastIntAsDuration | CastIntAsJson | CastRealAsInt | CastRealAsReal | CastRealAsString
        | CastRealAsDecimal | CastRealAsTime | CastRealAsDuration | CastRealAsJson
        | CastDecimalAsInt | CastDecimalAsReal | CastDecimalAsString | CastDecimalAsDecimal
        | CastDecimalAsTime | CastDecimalAsDuration | CastDecimalAsJson | CastStringAsInt
        | CastStringAsReal | CastStringAsString | CastStringAsDecimal | CastStringAsTime
        | CastStringAsDuration | CastStringAsJson | CastTimeAsInt | CastTimeAsReal
        | CastTimeAsString | CastTimeAsDecimal | CastTimeAsTime | CastTimeAsDuration
        | CastTimeAsJson | CastDurationAsInt | CastDurationAsReal | CastDurationAsString
        | CastDurationAsDecimal | CastDurationAsTime | CastDurationAsDuration | CastDurationAsJson
        | CastJsonAsInt | CastJsonAsReal | CastJsonAsString | CastJsonAsDecimal | CastJsonAsTime
        | CastJsonAsDuration | CastJsonAsJson => None,

        // comparisons
        NullEqInt | NullEqReal | NullEqDecimal | NullEqString | NullEqTime | NullEqDuration
        | NullEqJson => None,

        // arithmetic
        PlusReal | PlusDecimal | PlusInt | MinusReal | MinusDecimal | MinusInt | MultiplyReal
        | MultiplyDecimal | MultiplyInt | DivideReal | DivideDecimal | IntDivideInt
        | IntDivideDecimal | ModReal | ModDecimal | ModInt | MultiplyIntUnsigned => None,

        // math
        AbsInt | AbsUInt | AbsReal | AbsDecimal | CeilIntToDec | CeilIntToInt | CeilDecToInt
        | CeilDecToDec | CeilReal | FloorIntToDec | FloorIntToInt | FloorDecToInt | FloorDecToDec
        | FloorReal | RoundReal | RoundInt | RoundDec | Log1Arg | Log2Args | Log2 | Log10 | Rand
        | Pow | Conv | Crc32 | Sign | Sqrt | Exp | Pi => None,

        // logical, null tests and bit operations
        LogicalXor | UnaryMinusInt | UnaryMinusReal | UnaryMinusDecimal | DecimalIsNull
        | DurationIsNull | RealIsNull | StringIsNull | TimeIsNull | IntIsNull | JsonIsNull
        | BitAndSig | BitOrSig | BitXorSig | BitNegSig | IntIsTrue | RealIsTrue | DecimalIsTrue
        | IntIsFalse | RealIsFalse | DecimalIsFalse | LeftShift | RightShift => None,

        // set membership, control flow and pattern matching
        InInt | InReal | InDecimal | InString | InTime | InDuration | InJson | IfNullInt
        | IfNullReal | IfNullDecimal | IfNullString | IfNullTime | IfNullDuration | IfInt | IfReal
        | IfDecimal | IfString | IfTime | IfDuration | IfNullJson | IfJson | CaseWhenInt
        | CaseWhenReal | CaseWhenDecimal | CaseWhenString | CaseWhenTime | CaseWhenDuration
        | CaseWhenJson | CoalesceInt | CoalesceReal | CoalesceDecimal | CoalesceString
        | CoalesceTime | CoalesceDuration | CoalesceJson | LikeSig | RegexpSig | RegexpUtf8Sig => {
            None
        }

        // JSON
        JsonExtractSig | JsonUnquoteSig | JsonTypeSig | JsonSetSig | JsonInsertSig | JsonReplaceSig
        | JsonRemoveSig | JsonMergeSig | JsonObjectSig | JsonArraySig | JsonValidJsonSig
        | JsonContainsSig | JsonLengthSig => None,

        // date and time
        DateFormatSig | DateLiteral | DateDiff | NullTimeDiff | TimeStringTimeDiff
        | DurationDurationTimeDiff | StringTimeTimeDiff | TimeTimeTimeDiff | Date | Hour | Minute
        | Second | MicroSecond | Month | MonthName | NowWithArg | NowWithoutArg | DayName
        | DayOfMonth | DayOfWeek | DayOfYear | Year | UnixTimestampCurrent | UnixTimestampInt
        | UnixTimestampDec | FromUnixTime1Arg | FromUnixTime2Arg | ExtractDatetime
        | AddDateStringInt | AddDateDatetimeInt | SubDateStringInt | SubDateDatetimeInt => None,

        // string
        BitLength | Bin | Ascii | Char | CharLengthUtf8 | Concat | ConcatWs | Convert | Elt
        | ExportSet3Arg | FieldInt | FieldReal | FieldString | FindInSet | Format | FromBase64
        | HexIntArg | HexStrArg | InsertUtf8 | InstrUtf8 | Lower | LeftUtf8 | Length | LocateUtf8
        | LpadUtf8 | Ltrim | OctString | Quote | Repeat | Replace | ReverseUtf8 | RightUtf8
        | RpadUtf8 | Rtrim | Space | Strcmp | Substring2ArgsUtf8 | Substring3ArgsUtf8
        | SubstringIndex | ToBase64 | Trim1Arg | Trim2Args | Trim3Args | UnHex | UpperUtf8 => None,

        // encryption, hashing and system information
        AesDecrypt | AesEncrypt | Compress | Md5 | Password | RandomBytes | Sha1 | Sha2 | Uncompress
        | UncompressedLength | Database | FoundRows | CurrentUser | User | ConnectionId
        | LastInsertId | LastInsertIdWithId | Version | TiDbVersion | RowCount | Sleep | Lock
        | ReleaseLock | DecimalAnyValue | DurationAnyValue | IntAnyValue | JsonAnyValue
        | RealAnyValue | StringAnyValue | TimeAnyValue | InetAton | InetNtoa | Inet6Aton | Inet6Ntoa
        | IsIPv4 | IsIPv6 | Uuid => None,
    }
}
