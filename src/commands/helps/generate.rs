//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

pub const HELP: &str = r#"Write a requirements file of the installed dependencies.

Only modules imported by the project's source files are pinned; existing
requirements files are not read.

Usage:
    pydep generate [options] [<path>]

Args:
    <path>              project directory to scan (default: current directory)

Options:
    --output <file>     name of the file to write (default: requirements.txt)
    --recursive, -r     also scan every subdirectory
    --create-venv       resolve versions from the project's .venv

Use 'pydep help generate' to read more about the command.
"#;
