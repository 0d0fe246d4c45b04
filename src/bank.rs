// src/bank.rs

use crate::models::question::Question;

/// The built-in question bank. Built at compile time and shared by reference.
pub static PYTHON_BASICS: [Question; 10] = [
    Question {
        id: 1,
        text: "Which keyword is used to define a function in Python?",
        options: &["def", "function", "func", "define"],
        correct_index: 0,
    },
    Question {
        id: 2,
        text: "Which Python data type is immutable?",
        options: &["list", "set", "tuple", "dict"],
        correct_index: 2,
    },
    Question {
        id: 3,
        text: "Which of these is a valid Python list literal?",
        options: &["(1, 2, 3)", "[1, 2, 3]", "{1, 2, 3}", "<1, 2, 3>"],
        correct_index: 1,
    },
    Question {
        id: 4,
        text: "Which operator performs floor division in Python?",
        options: &["/", "//", "%", "**"],
        correct_index: 1,
    },
    Question {
        id: 5,
        text: "What is the result of len('hello')?",
        options: &["4", "5", "6", "Error"],
        correct_index: 1,
    },
    Question {
        id: 6,
        text: "How do you import the math module?",
        options: &["use math", "import(math)", "import math", "math import"],
        correct_index: 2,
    },
    Question {
        id: 7,
        text: "Which literal creates a set in Python?",
        options: &["{}", "{1, 2, 3}", "[]", "()"],
        correct_index: 1,
    },
    Question {
        id: 8,
        text: "The index of the first element in a Python list is:",
        options: &["1", "0", "-1", "Depends"],
        correct_index: 1,
    },
    Question {
        id: 9,
        text: "Which statement handles exceptions in Python?",
        options: &["catch", "try...except", "error...handle", "guard"],
        correct_index: 1,
    },
    Question {
        id: 10,
        text: "Which of these is a Boolean value in Python?",
        options: &["TRUE", "True", "true", "Yes"],
        correct_index: 1,
    },
];
