// json-treediff is a tool for reporting structural differences between JSON trees
// Copyright (C) 2025  Peoples Grocers LLC
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//
// To purchase a license under different terms contact admin@peoplesgrocers.com
// To request changes, report bugs, or give user feedback contact
// marxism@peoplesgrocers.com
//


use std::path::PathBuf;

xflags::xflags! {
    cmd json-treediff {
        /// Log engine decisions to stderr (RUST_LOG overrides)
        optional -v, --verbose

        default cmd diff {
            /// JSON file on the left side of the comparison
            required left: PathBuf

            /// JSON file on the right side (defaults to the left file after applying edits)
            optional right: PathBuf

            /// Write the report to this file instead of stdout
            optional -o, --output output: PathBuf

            /// Report format: text (default) or json
            optional --format format: String

            /// Spaces per indentation level in the text report (default 2)
            optional --indent indent: usize

            /// Truncate values longer than this many characters (default 12)
            optional --trim trim: usize

            /// Report every difference on one level, keyed by its full path
            optional --flatten

            /// Treat numerically equal int and float values as equal
            optional --ignore-numeric-types

            /// Treat numbers at most this far apart as equal
            optional --tolerance tolerance: f64

            /// Edit applied to the right side: /json/pointer=<json value>
            repeated --set set: String

            /// Key or index removed from the right side: /json/pointer
            repeated --remove remove: String
        }
    }
}
