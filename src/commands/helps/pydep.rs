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

pub const HELP: &str = r#"Pydep is a dependency checker and manager for python projects.

Usage:
    pydep [options] [command]

Commands:
    scan            report the missing dependencies of a project
    install         install the missing dependencies of a project
    generate        write a requirements file of the installed dependencies
    list            list the installed packages
    add             install a package
    upgrade         upgrade an installed package
    check           verify installed packages have compatible requirements
    tree            view the dependency graph of the environment
    help            read documentation about a command

Options:
    --python <exe>        python interpreter to work with
    --package-map <file>  json file mapping import names to package names
    --verbose             display debugging information
    --color <when>        coloring: auto, always, never
    --version             print version information and exit
    --help, -h            print help information

Use 'pydep help <command>' for more information about a command.
"#;
