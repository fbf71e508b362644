//! 취약점 식별자 정렬 키
//!
//! `PREFIX-YYYY-NNNN[-SUFFIX]` 형태의 식별자를 정수 정렬 키로 변환합니다.
//! 키는 4자리 연도 뒤에 10자리로 0-패딩한 일련번호를 이어 붙인 값입니다.
//!
//! ```text
//! CVE-2021-0002-A   -> 20210000000002
//! CVE-2021-12345-A  -> 20210000012345
//! ```
//!
//! # 센티넬 키
//!
//! 다음 경우 키는 [`SENTINEL_KEY`] (0) 이며 목록의 맨 앞에 정렬됩니다.
//!
//! - `-` 로 나눈 필드가 정확히 3개인 경우 (레거시 동작, 경고 아님)
//! - 필드 수가 3, 4가 아닌 경우
//! - 연도가 4자리 숫자가 아니거나 번호가 1-10자리 숫자가 아닌 경우
//!
//! 마지막 두 경우는 [`try_canonical_key`]에서 [`IdentifierError`]로 드러납니다.

use crate::error::IdentifierError;

/// 파싱할 수 없는 식별자에 부여되는 키
pub const SENTINEL_KEY: u64 = 0;

/// 일련번호 패딩 폭
const NUMBER_WIDTH: usize = 10;

/// 연도 자릿수
const YEAR_WIDTH: usize = 4;

/// 식별자의 정렬 키를 반환합니다.
///
/// 실패하지 않습니다. 파싱 실패는 [`SENTINEL_KEY`]가 됩니다.
pub fn canonical_key(identifier: &str) -> u64 {
    try_canonical_key(identifier).unwrap_or(SENTINEL_KEY)
}

/// 식별자의 정렬 키를 반환하되 형식 오류를 에러로 돌려줍니다.
///
/// 3필드 식별자는 레거시 동작에 따라 `Ok(SENTINEL_KEY)` 입니다.
pub fn try_canonical_key(identifier: &str) -> Result<u64, IdentifierError> {
    let fields: Vec<&str> = identifier.split('-').collect();

    let (year, number) = match fields.as_slice() {
        [_, _, _] => return Ok(SENTINEL_KEY),
        [_, year, number, _] => (*year, *number),
        _ => {
            return Err(IdentifierError::FieldCount {
                identifier: identifier.to_owned(),
                count: fields.len(),
            });
        }
    };

    if year.len() != YEAR_WIDTH || !is_ascii_digits(year) {
        return Err(IdentifierError::Year {
            identifier: identifier.to_owned(),
            year: year.to_owned(),
        });
    }

    if number.is_empty() || number.len() > NUMBER_WIDTH || !is_ascii_digits(number) {
        return Err(IdentifierError::Number {
            identifier: identifier.to_owned(),
            number: number.to_owned(),
        });
    }

    // 4 + 10 자리는 u64 범위 안이므로 파싱은 실패하지 않는다
    let joined = format!("{year}{number:0>width$}", width = NUMBER_WIDTH);
    joined.parse::<u64>().map_err(|_| IdentifierError::Number {
        identifier: identifier.to_owned(),
        number: number.to_owned(),
    })
}

/// 식별자 목록을 정렬 키 오름차순으로 안정 정렬합니다.
///
/// 같은 키(센티넬 포함)를 가진 항목은 입력 순서를 유지합니다.
pub fn sort_identifiers<S: AsRef<str>>(identifiers: &mut [S]) {
    identifiers.sort_by_cached_key(|id| canonical_key(id.as_ref()));
}

fn is_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
