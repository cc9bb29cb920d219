/*
    Copyright 2025 MydriaTech AB

    Licensed under the Apache License 2.0 with Free world makers exception
    1.0.0 (the "License"); you may not use this file except in compliance with
    the License. You should have obtained a copy of the License with the source
    or binary distribution in file named

        LICENSE-Apache-2.0-with-FWM-Exception-1.0.0

    Unless required by applicable law or agreed to in writing, software
    distributed under the License is distributed on an "AS IS" BASIS,
    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
    See the License for the specific language governing permissions and
    limitations under the License.
*/

//! Rendering of issued numbers into caller supplied templates.

/// Placeholder replaced by the issued number.
const PLACEHOLDER: char = '?';

/// Render `value` into `template`.
///
/// Without a template the bare decimal is returned. Otherwise every
/// [PLACEHOLDER] in the template is replaced by the decimal in a single
/// substitution pass, zero-padded to `digits` width when `digits` is set
/// and positive. Literal parts of the template are never padded.
pub fn render(value: u64, template: Option<&str>, digits: Option<usize>) -> String {
    let number = match digits {
        Some(width) if width > 0 => format!("{value:0width$}"),
        _unset_or_zero => value.to_string(),
    };
    match template {
        None => number,
        Some(template) => template.replace(PLACEHOLDER, &number),
    }
}

mod test {
    //! Rendering tests.

    #[test]
    fn test_padded_template() {
        assert_eq!(super::render(7, Some("INV-?"), Some(4)), "INV-0007");
    }

    #[test]
    fn test_bare_number_without_template() {
        assert_eq!(super::render(42, None, None), "42");
    }

    #[test]
    fn test_every_placeholder_gets_the_same_value() {
        assert_eq!(super::render(3, Some("A-?-B-?"), None), "A-3-B-3");
    }

    #[test]
    fn test_zero_digits_is_unpadded() {
        assert_eq!(super::render(7, Some("?"), Some(0)), "7");
    }

    #[test]
    fn test_padding_never_truncates() {
        assert_eq!(super::render(12345, Some("?"), Some(3)), "12345");
    }
}
